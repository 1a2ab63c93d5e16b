use num_enum::TryFromPrimitive;

/// This parameter is used to indicate the version of the SMPP protocol.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InterfaceVersion {
    SmppV33 = 0x33,
    SmppV34 = 0x34,
    SmppV50 = 0x50,
}

impl InterfaceVersion {
    /// The raw wire value of this version.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}
