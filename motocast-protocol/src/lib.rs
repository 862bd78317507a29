//! Motocast video link framing
//!
//! This crate defines how H.264 access units travel over the Motocast
//! wireless link. The transport delivers bytes in chunks of arbitrary size;
//! chunk boundaries have no relation to access unit boundaries.
//!
//! # Wire Format
//!
//! The stream is a plain concatenation of length-prefixed access units:
//! ```text
//! ┌──────────────────┬──────────────────────────────┐
//! │ LENGTH (u32, LE) │ ACCESS UNIT                  │
//! │ 4B               │ LENGTH bytes of H.264 data   │
//! └──────────────────┴──────────────────────────────┘
//! ```
//!
//! There is no checksum and no synchronization marker. Once framing is lost
//! the receiver can only recover through an external reset of its
//! [`PendingPacket`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod encode;
pub mod packet;

pub use encode::{encode_access_unit, encode_header, encode_to_vec};
pub use packet::{
    heap_body, AccessUnit, BodyAllocator, PacketError, PacketState, PendingPacket,
    DEFAULT_MAX_ACCESS_UNIT_LEN, HEADER_LEN,
};
