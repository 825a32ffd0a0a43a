pub mod actions;
pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod inspect;
pub mod output;
pub mod runtime;
pub mod timeline;

pub use actions::{action_rows, cmd_actions, ActionRow, ActionsArgs};
pub use config::{cmd_config, ConfigArgs};
pub use inspect::{action_detail, cmd_inspect, resolve_action, ActionDetail, InspectArgs};
pub use output::OutputFormat;
pub use timeline::{cmd_frame, cmd_hit, cmd_timeline, FrameArgs, HitArgs, TimelineArgs};
