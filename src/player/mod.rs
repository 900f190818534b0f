pub mod spotify;
pub mod traits;

pub use spotify::{SpotifyClient, SpotifyError};
pub use traits::{PlaybackSource, PlaybackState};
