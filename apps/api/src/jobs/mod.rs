// Job submission: the in-memory registry and the endpoint that fills it.

pub mod handlers;
pub mod registry;
