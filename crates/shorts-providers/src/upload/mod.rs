//! Upload providers.

mod youtube;

pub use youtube::YouTubeClient;
