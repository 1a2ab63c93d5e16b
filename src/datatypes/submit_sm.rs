// ABOUTME: Implements SMPP v3.4 submit_sm and submit_sm_resp PDUs for short message submission
// ABOUTME: Mirrors the data_sm/deliver_sm codec pattern; optional parameters are a flat TLV list

use crate::datatypes::{
    AddressError, CommandId, CommandStatus, DataCoding, DestinationAddr, EsmClass,
    NumericPlanIndicator, ScheduleDeliveryTime, ServiceType, ShortMessage, SourceAddr, Tlv,
    TypeOfNumber, ValidityPeriod,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error;

use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_u8, encode_cstring,
    encode_u8,
};

/// Validation errors for SubmitSm PDU
#[derive(Debug, Error)]
pub enum SubmitSmValidationError {
    #[error("Service type error: {0}")]
    ServiceType(#[from] crate::datatypes::ServiceTypeError),
    #[error("Source address error: {0}")]
    SourceAddr(#[from] AddressError),
    #[error("Short message error: {0}")]
    ShortMessage(#[from] crate::datatypes::FixedStringError),
    #[error("sm_length ({sm_length}) does not match short_message byte length ({actual})")]
    SmLengthMismatch { sm_length: u8, actual: usize },
}

/// This operation is used by an ESME to submit a short message to the SMSC for onward
/// transmission to a specified short message entity (SME). The submit_sm PDU does not
/// support the transaction message mode.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    // Mandatory parameters
    pub service_type: ServiceType,
    pub source_addr_ton: TypeOfNumber,
    pub source_addr_npi: NumericPlanIndicator,
    pub source_addr: SourceAddr,
    pub dest_addr_ton: TypeOfNumber,
    pub dest_addr_npi: NumericPlanIndicator,
    pub destination_addr: DestinationAddr,
    pub esm_class: EsmClass,
    pub protocol_id: u8,
    pub priority_flag: u8,
    pub schedule_delivery_time: ScheduleDeliveryTime,
    pub validity_period: ValidityPeriod,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: DataCoding,
    pub sm_default_msg_id: u8,
    pub sm_length: u8,
    pub short_message: ShortMessage,

    /// Optional TLV parameters, e.g. message_payload, sar_* segmentation fields,
    /// user_message_reference, source_port/destination_port.
    pub optional_parameters: Vec<Tlv>,
}

impl SubmitSm {
    /// Validate cross-field invariants not already enforced by the field types.
    pub fn validate(&self) -> Result<(), SubmitSmValidationError> {
        if self.sm_length as usize != self.short_message.as_bytes().len() {
            return Err(SubmitSmValidationError::SmLengthMismatch {
                sm_length: self.sm_length,
                actual: self.short_message.as_bytes().len(),
            });
        }
        Ok(())
    }

    /// Returns the message_payload TLV value if present, otherwise the short_message bytes.
    ///
    /// Per the precedence rule: when both are present and message_payload is non-empty,
    /// message_payload wins. Neither field is discarded from the struct either way.
    pub fn effective_message(&self) -> &[u8] {
        match self.message_payload() {
            Some(payload) if !payload.is_empty() => payload,
            _ => self.short_message.as_bytes(),
        }
    }

    /// Decode `effective_message()` into text using the alphabet `data_coding` selects.
    pub fn decoded_text(&self) -> Result<String, CodecError> {
        crate::charset::decode_message(self.effective_message(), self.data_coding)
    }

    /// Get the message_payload TLV value if present.
    pub fn message_payload(&self) -> Option<&[u8]> {
        self.optional_parameters
            .iter()
            .find(|tlv| tlv.tag == crate::datatypes::tlv::tags::MESSAGE_PAYLOAD)
            .map(|tlv| tlv.value.as_ref())
    }

    /// Add a custom TLV parameter.
    pub fn add_tlv(&mut self, tlv: Tlv) {
        self.optional_parameters.push(tlv);
    }
}

impl Encodable for SubmitSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        buf.put_u32(0); // command_length (placeholder, patched by to_bytes)
        buf.put_u32(CommandId::SubmitSm as u32);
        buf.put_u32(u32::from(self.command_status));
        buf.put_u32(self.sequence_number);

        encode_cstring(buf, self.service_type.as_str(), 6);
        encode_u8(buf, self.source_addr_ton as u8);
        encode_u8(buf, self.source_addr_npi as u8);
        encode_cstring(buf, self.source_addr.as_str().unwrap_or(""), 21);
        encode_u8(buf, self.dest_addr_ton as u8);
        encode_u8(buf, self.dest_addr_npi as u8);
        encode_cstring(buf, self.destination_addr.as_str().unwrap_or(""), 21);
        encode_u8(buf, self.esm_class.to_byte());
        encode_u8(buf, self.protocol_id);
        encode_u8(buf, self.priority_flag);
        encode_cstring(buf, self.schedule_delivery_time.as_str().unwrap_or(""), 17);
        encode_cstring(buf, self.validity_period.as_str().unwrap_or(""), 17);
        encode_u8(buf, self.registered_delivery);
        encode_u8(buf, self.replace_if_present_flag);
        encode_u8(buf, self.data_coding.to_byte());
        encode_u8(buf, self.sm_default_msg_id);
        encode_u8(buf, self.sm_length);
        buf.extend_from_slice(self.short_message.as_bytes());

        for tlv in &self.optional_parameters {
            tlv.encode(buf)?;
        }

        Ok(())
    }
}

impl Decodable for SubmitSm {
    fn command_id() -> CommandId {
        CommandId::SubmitSm
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let service_type_str = decode_cstring(buf, 6, "service_type")?;
        let service_type =
            ServiceType::new(&service_type_str).map_err(|e| CodecError::FieldValidation {
                field: "service_type",
                reason: e.to_string(),
            })?;

        let source_addr_ton =
            TypeOfNumber::try_from(decode_u8(buf)?).map_err(|_| CodecError::FieldValidation {
                field: "source_addr_ton",
                reason: "Invalid type of number".to_string(),
            })?;
        let source_addr_npi = NumericPlanIndicator::try_from(decode_u8(buf)?).map_err(|_| {
            CodecError::FieldValidation {
                field: "source_addr_npi",
                reason: "Invalid numbering plan indicator".to_string(),
            }
        })?;
        let source_addr_str = decode_cstring(buf, 21, "source_addr")?;
        let source_addr = SourceAddr::new(&source_addr_str, source_addr_ton).map_err(|e| {
            CodecError::FieldValidation {
                field: "source_addr",
                reason: e.to_string(),
            }
        })?;

        let dest_addr_ton =
            TypeOfNumber::try_from(decode_u8(buf)?).map_err(|_| CodecError::FieldValidation {
                field: "dest_addr_ton",
                reason: "Invalid type of number".to_string(),
            })?;
        let dest_addr_npi = NumericPlanIndicator::try_from(decode_u8(buf)?).map_err(|_| {
            CodecError::FieldValidation {
                field: "dest_addr_npi",
                reason: "Invalid numbering plan indicator".to_string(),
            }
        })?;
        let destination_addr_str = decode_cstring(buf, 21, "destination_addr")?;
        let destination_addr = DestinationAddr::new(&destination_addr_str, dest_addr_ton)
            .map_err(|e| CodecError::FieldValidation {
                field: "destination_addr",
                reason: e.to_string(),
            })?;

        let esm_class =
            EsmClass::from_byte(decode_u8(buf)?).map_err(|e| CodecError::FieldValidation {
                field: "esm_class",
                reason: e.to_string(),
            })?;
        let protocol_id = decode_u8(buf)?;
        let priority_flag = decode_u8(buf)?;

        let schedule_delivery_time_str = decode_cstring(buf, 17, "schedule_delivery_time")?;
        let schedule_delivery_time = ScheduleDeliveryTime::from_parsed_string(
            schedule_delivery_time_str,
        )
        .map_err(|e| CodecError::FieldValidation {
            field: "schedule_delivery_time",
            reason: e.to_string(),
        })?;

        let validity_period_str = decode_cstring(buf, 17, "validity_period")?;
        let validity_period =
            ValidityPeriod::from_parsed_string(validity_period_str).map_err(|e| {
                CodecError::FieldValidation {
                    field: "validity_period",
                    reason: e.to_string(),
                }
            })?;

        let registered_delivery = decode_u8(buf)?;
        let replace_if_present_flag = decode_u8(buf)?;
        let data_coding = DataCoding::from_byte(decode_u8(buf)?);
        let sm_default_msg_id = decode_u8(buf)?;
        let sm_length = decode_u8(buf)?;

        if buf.remaining() < sm_length as usize {
            return Err(CodecError::Incomplete);
        }
        let mut message_bytes = vec![0u8; sm_length as usize];
        buf.copy_to_slice(&mut message_bytes);
        let short_message =
            ShortMessage::new(&message_bytes).map_err(|e| CodecError::FieldValidation {
                field: "short_message",
                reason: e.to_string(),
            })?;

        let mut optional_parameters = Vec::new();
        while buf.remaining() > 0 {
            match Tlv::decode(buf) {
                Ok(tlv) => optional_parameters.push(tlv),
                Err(CodecError::Incomplete) => break,
                Err(e) => return Err(e),
            }
        }

        let pdu = SubmitSm {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            service_type,
            source_addr_ton,
            source_addr_npi,
            source_addr,
            dest_addr_ton,
            dest_addr_npi,
            destination_addr,
            esm_class,
            protocol_id,
            priority_flag,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            replace_if_present_flag,
            data_coding,
            sm_default_msg_id,
            sm_length,
            short_message,
            optional_parameters,
        };

        pdu.validate().map_err(|e| CodecError::FieldValidation {
            field: "submit_sm",
            reason: e.to_string(),
        })?;

        Ok(pdu)
    }
}

/// Validation errors for SubmitSmResponse PDU
#[derive(Debug, Error)]
pub enum SubmitSmResponseValidationError {
    #[error("Message ID error: {0}")]
    MessageId(#[from] crate::datatypes::FixedStringError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// Message ID assigned by the SMSC. Empty on error conditions.
    pub message_id: crate::datatypes::MessageId,
}

impl SubmitSmResponse {
    pub fn success(sequence_number: u32, message_id: crate::datatypes::MessageId) -> Self {
        SubmitSmResponse {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id,
        }
    }

    pub fn error(sequence_number: u32, command_status: CommandStatus) -> Self {
        SubmitSmResponse {
            command_status,
            sequence_number,
            message_id: crate::datatypes::MessageId::new(b"").expect("empty message id is valid"),
        }
    }
}

impl Encodable for SubmitSmResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        buf.put_u32(0);
        buf.put_u32(CommandId::SubmitSmResp as u32);
        buf.put_u32(u32::from(self.command_status));
        buf.put_u32(self.sequence_number);

        encode_cstring(buf, self.message_id.as_str().unwrap_or(""), 65);

        Ok(())
    }
}

impl Decodable for SubmitSmResponse {
    fn command_id() -> CommandId {
        CommandId::SubmitSmResp
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let message_id_str = decode_cstring(buf, 65, "message_id")?;
        let message_id = crate::datatypes::MessageId::new(message_id_str.as_bytes()).map_err(
            |e| CodecError::FieldValidation {
                field: "message_id",
                reason: e.to_string(),
            },
        )?;

        Ok(SubmitSmResponse {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id,
        })
    }
}
