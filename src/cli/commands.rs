use clap::Subcommand;

use super::actions::ActionsArgs;
use super::config::ConfigArgs;
use super::inspect::InspectArgs;
use super::timeline::{FrameArgs, HitArgs, TimelineArgs};

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// List the recorded actions in start-time order
    Actions(ActionsArgs),

    /// Show one action with its log, events, resources and error
    Inspect(InspectArgs),

    /// Print the timeline grid and bars for a given width
    Timeline(TimelineArgs),

    /// Resolve a pointer position to the timeline bar under it
    Hit(HitArgs),

    /// Find the screencast frame shown at a point in time
    Frame(FrameArgs),

    /// Inspect traceview configuration
    Config(ConfigArgs),
}
