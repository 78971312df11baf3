pub mod message;
pub mod outcome;

pub use message::{MessageRequest, TemplateParameter};
pub use outcome::{DeliveryOutcome, DeliveryReport};
