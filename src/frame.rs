//! Frame reassembly error type.
//!
//! PDU body decoding itself lives in `codec::Frame` / `codec::PduRegistry`,
//! which own the per-command_id decode table. This module only carries the
//! error type `Connection` uses while buffering a frame off the wire, plus a
//! re-export of `codec::Frame` so callers can keep writing `crate::frame::Frame`.

use core::fmt;
use num_enum::TryFromPrimitiveError;
use std::num::TryFromIntError;
use std::string::FromUtf8Error;

use crate::codec::CodecError;
use crate::datatypes::{
    CommandId, CommandStatus, InterfaceVersion, NumericPlanIndicator, PriorityFlag, TypeOfNumber,
};

pub use crate::codec::Frame;

#[derive(Debug)]
pub enum Error {
    /// Not enough data is available to parse a message
    Incomplete,

    /// Invalid message encoding
    Other(crate::Error),
}

impl From<String> for Error {
    fn from(src: String) -> Error {
        Error::Other(src.into())
    }
}

impl From<&str> for Error {
    fn from(src: &str) -> Error {
        src.to_string().into()
    }
}

impl From<FromUtf8Error> for Error {
    fn from(src: FromUtf8Error) -> Error {
        Error::Other(src.into())
    }
}

impl From<TryFromIntError> for Error {
    fn from(src: TryFromIntError) -> Error {
        Error::Other(src.into())
    }
}

impl From<TryFromPrimitiveError<CommandId>> for Error {
    fn from(src: TryFromPrimitiveError<CommandId>) -> Error {
        Error::Other(src.into())
    }
}

impl From<TryFromPrimitiveError<CommandStatus>> for Error {
    fn from(src: TryFromPrimitiveError<CommandStatus>) -> Error {
        Error::Other(src.into())
    }
}

impl From<TryFromPrimitiveError<InterfaceVersion>> for Error {
    fn from(src: TryFromPrimitiveError<InterfaceVersion>) -> Error {
        Error::Other(src.into())
    }
}

impl From<TryFromPrimitiveError<NumericPlanIndicator>> for Error {
    fn from(src: TryFromPrimitiveError<NumericPlanIndicator>) -> Error {
        Error::Other(src.into())
    }
}

impl From<TryFromPrimitiveError<TypeOfNumber>> for Error {
    fn from(src: TryFromPrimitiveError<TypeOfNumber>) -> Error {
        Error::Other(src.into())
    }
}

impl From<TryFromPrimitiveError<PriorityFlag>> for Error {
    fn from(src: TryFromPrimitiveError<PriorityFlag>) -> Error {
        Error::Other(src.into())
    }
}

impl From<CodecError> for Error {
    fn from(src: CodecError) -> Error {
        match src {
            CodecError::Incomplete => Error::Incomplete,
            other => Error::Other(Box::new(other)),
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Incomplete => "stream ended early".fmt(fmt),
            Error::Other(err) => err.fmt(fmt),
        }
    }
}
