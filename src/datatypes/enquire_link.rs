use crate::codec::{CodecError, Decodable, Encodable, PduHeader};
use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::impl_complete_header_only_pdu;
use bytes::Buf;
use std::io::Cursor;

/// enquire_link PDU (Section 4.11.1) - Keep-alive message
///
/// Used to provide a confidence check of the communication path between an
/// ESME and an SMSC. On receipt, the recipient replies with an
/// enquire_link_resp, confirming the application-level connection is alive.
#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLink {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

/// enquire_link_resp PDU (Section 4.11.2) - Keep-alive response
#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLinkResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(EnquireLink, CommandId::EnquireLink);
impl_complete_header_only_pdu!(EnquireLinkResponse, CommandId::EnquireLinkResp);
