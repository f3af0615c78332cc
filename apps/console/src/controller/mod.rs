//! Shell state: user actions and backend completions in, queued commands out.

pub mod events;
pub mod orchestration;
pub mod reducer;
