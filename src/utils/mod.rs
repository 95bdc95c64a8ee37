// Low-level helpers shared by the tag readers
pub mod cursor;
pub mod encoding;
pub mod io;
pub mod synchsafe;
