//! Rich content carried by transcript entries: images, polls and inline
//! keyboards. Builders here are pure and know nothing about the transcript.

pub mod image;
pub mod keyboard;
pub mod poll;
