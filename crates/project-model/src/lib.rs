//! Reelplan Project Model
//!
//! Defines the data contracts the composition core reads:
//! - **Project:** metadata and output aspect ratio
//! - **Track:** a lane of one media role (video, music, voiceover, text)
//! - **KeyFrame:** a timed placement of media or inline text on a track
//! - **MediaItem:** a generated or uploaded asset and its readiness
//! - **Composition:** the snapshot of all of the above, plus validation
//!
//! All times are milliseconds on the project timeline.

pub mod composition;
pub mod keyframe;
pub mod media;
pub mod project;
pub mod track;
pub mod validation;

pub use composition::*;
pub use keyframe::*;
pub use media::*;
pub use project::*;
pub use track::*;
pub use validation::*;
