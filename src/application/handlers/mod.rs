pub mod batch_dispatcher;
