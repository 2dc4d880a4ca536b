//! Conversion of managed values to and from caller-owned native memory.
//!
//! Outbound writes allocate natively and hand ownership to the caller.
//! Inbound reads borrow the caller's memory and copy out of it. Neither
//! direction reports faults; errors go back to the boundary wrapper.

pub mod error;
pub mod inbound;
pub mod outbound;
pub mod params;
pub mod release;

use hostbridge_abi::{Blittable, ByteView, ByteViewMut};

pub use error::MarshalError;
pub use inbound::read_inbound;
pub use outbound::write_outbound;
pub use params::read_parameter_list;
pub use release::release_outbound;

/// Writes a compile-time laid out value at the start of `destination`.
pub fn write_blittable<T: Blittable>(value: T, destination: &mut [u8]) -> Result<(), MarshalError> {
    ByteViewMut::new(destination).write(0, value)?;
    Ok(())
}

pub fn read_blittable<T: Blittable>(source: &[u8]) -> Result<T, MarshalError> {
    Ok(ByteView::new(source).read(0)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blittable_helpers() {
        let mut buffer = [0u8; 8];
        write_blittable(0x0102_0304u32, &mut buffer).unwrap();
        assert_eq!(read_blittable::<u32>(&buffer).unwrap(), 0x0102_0304);
        assert!(write_blittable(1u64, &mut buffer[..4]).is_err());
    }
}
