//! trackpub crawls directory trees for bioinformatics data files, groups
//! them by a user-supplied pattern, pairs data files with their companion
//! indexes, and republishes the result as a symlink tree plus an ordered
//! display listing.

pub mod config;
pub mod pipeline;
