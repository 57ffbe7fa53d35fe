//! Decoders for the boxes that carry vtt cue timing.

/*
    REFERENCES
    ----------

    1. https://github.com/shaka-project/shaka-player/blob/d465942c4393e6c891d6a230bea90a44d90cc70b/lib/util/mp4_box_parsers.js

*/

mod mdhd;
mod tfdt;
mod trun;

pub use mdhd::MdhdBox;
pub use tfdt::TfdtBox;
pub use trun::{TrunBox, TrunSample};
