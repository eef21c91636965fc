pub(crate) mod bytes;
mod hexdump;
mod utf16;

pub(crate) use self::hexdump::hexdump;
pub(crate) use self::utf16::decode_utf16le_lossy;
