//! Splash Animation Core (host-agnostic)
//!
//! Timeline scheduling for the loading overlay: element registration, random
//! particle parameters, timeline building, absolute-time schedules, and a
//! stepped scheduler that fires a one-shot completion callback. Hosts receive
//! plain numeric property writes and render them however they like.

pub mod completion;
pub mod config;
pub mod element;
pub mod ids;
pub mod interp;
pub mod outputs;
pub mod random;
pub mod registry;
pub mod schedule;
pub mod scheduler;
pub mod sequence;
pub mod timeline;

// Re-exports for consumers (hosts, orchestrator)
pub use completion::{CompletionToken, TokenState};
pub use config::{
    DotPhase, ExitPhase, LogoPhase, ParticlePhase, ProgressPhase, SequenceConfig, ValueRange,
};
pub use element::{ElementRole, Property, PropertySet, VisualElement};
pub use ids::{ElementId, SegmentId};
pub use interp::Easing;
pub use outputs::{Frame, PropertyWrite, SchedulerEvent};
pub use random::{ParameterSource, ParticleParams, RandomParameterGenerator};
pub use registry::{ElementRegistry, RegistryError};
pub use schedule::{Schedule, ScheduledSegment};
pub use scheduler::{SchedulerError, SchedulerState, TimelineScheduler};
pub use sequence::{build_loading_timeline, OverlayElements};
pub use timeline::{AnimationSegment, DetachedSegment, Timeline, TimelineBuilder, TimelineError};
