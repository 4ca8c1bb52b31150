pub mod codec;
pub mod encode;
pub mod packet;
pub mod response;

pub use codec::PacketCodec;
pub use packet::{capabilities, status, Packet};
