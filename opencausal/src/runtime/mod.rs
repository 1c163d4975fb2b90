mod messenger;
mod sample;

pub(crate) use messenger::handler_stack;
pub use messenger::{handler_depth, push_handler, HandlerScope, Messenger};
pub use sample::{sample, CondIndepStackFrame, SampleMsg};
