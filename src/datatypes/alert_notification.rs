// ABOUTME: Implements SMPP v3.4 alert_notification PDU for SMSC event notifications
// ABOUTME: Provides notification functionality per specification Section 4.12

use crate::datatypes::{
    AddressError, CommandId, CommandStatus, NumericPlanIndicator, SourceAddr, TypeOfNumber,
};
use bytes::{BufMut, BytesMut};
use std::io::Cursor;
use thiserror::Error;

// Import codec traits
use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_u8, encode_cstring,
    encode_u8,
};

/// Validation errors for AlertNotification PDU
#[derive(Debug, Error)]
pub enum AlertNotificationValidationError {
    #[error("Source address error: {0}")]
    SourceAddr(AddressError),
    #[error("ESME address error: {0}")]
    EsmeAddr(AddressError),
}

/// SMPP v3.4 alert_notification PDU (Section 4.12.1)
///
/// The alert_notification PDU is sent by the SMSC to an ESME to notify it of
/// the availability of a mobile subscriber for message delivery. This PDU is
/// typically used when:
/// - A mobile subscriber becomes available after being unreachable
/// - The SMSC wants to notify the ESME that queued messages can now be delivered
/// - A subscriber's status changes from unavailable to available
///
/// ## Key Features
/// - Notification-only PDU (no response PDU)
/// - Indicates subscriber availability for message delivery
/// - Provides source and ESME address information
/// - Used for efficient message queue management
///
/// ## Mandatory Parameters
/// - source_addr_ton: Type of Number of the subscriber
/// - source_addr_npi: Numbering Plan Indicator of the subscriber
/// - source_addr: Address of the available subscriber
/// - esme_addr_ton: Type of Number for ESME address
/// - esme_addr_npi: Numbering Plan Indicator for ESME address
/// - esme_addr: Address of the ESME to be notified
///
/// ## Usage Scenarios
/// 1. **Subscriber Availability**: Mobile device comes back online
/// 2. **Network Recovery**: Network connectivity restored to subscriber
/// 3. **Roaming Updates**: Subscriber enters coverage area
/// 4. **Queue Management**: SMSC ready to deliver pending messages
///
/// ## References
/// - SMPP v3.4 Specification Section 4.12.1
#[derive(Clone, Debug, PartialEq)]
pub struct AlertNotification {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    // Mandatory parameters
    /// Type of Number of the subscriber that is now available.
    /// Indicates the addressing scheme used for the source address.
    pub source_addr_ton: TypeOfNumber,

    /// Numbering Plan Indicator of the subscriber that is now available.
    /// Specifies the numbering plan for the source address.
    pub source_addr_npi: NumericPlanIndicator,

    /// Address of the subscriber that is now available for message delivery.
    /// This is typically a mobile phone number or subscriber identifier.
    pub source_addr: SourceAddr,

    /// Type of Number for the ESME address.
    /// Indicates the addressing scheme used for the ESME address.
    pub esme_addr_ton: TypeOfNumber,

    /// Numbering Plan Indicator for the ESME address.
    /// Specifies the numbering plan for the ESME address.
    pub esme_addr_npi: NumericPlanIndicator,

    /// Address of the ESME that should be notified.
    /// This identifies which ESME should be informed of the subscriber availability.
    pub esme_addr: SourceAddr, // Reusing SourceAddr type for ESME address
}

impl AlertNotification {
    /// Create a new AlertNotification PDU
    pub fn new(
        sequence_number: u32,
        source_addr_ton: TypeOfNumber,
        source_addr_npi: NumericPlanIndicator,
        source_addr: SourceAddr,
        esme_addr_ton: TypeOfNumber,
        esme_addr_npi: NumericPlanIndicator,
        esme_addr: SourceAddr,
    ) -> Result<Self, AlertNotificationValidationError> {
        let pdu = AlertNotification {
            command_status: CommandStatus::Ok, // Always 0 for notifications
            sequence_number,
            source_addr_ton,
            source_addr_npi,
            source_addr,
            esme_addr_ton,
            esme_addr_npi,
            esme_addr,
        };

        // Validate the PDU
        pdu.validate()?;
        Ok(pdu)
    }

    /// Create an AlertNotification for a mobile subscriber becoming available
    pub fn subscriber_available(
        sequence_number: u32,
        subscriber_number: &str,
        subscriber_ton: TypeOfNumber,
        subscriber_npi: NumericPlanIndicator,
        esme_address: &str,
        esme_ton: TypeOfNumber,
        esme_npi: NumericPlanIndicator,
    ) -> Result<Self, AlertNotificationValidationError> {
        let source_addr = SourceAddr::new(subscriber_number, subscriber_ton)
            .map_err(AlertNotificationValidationError::SourceAddr)?;
        let esme_addr = SourceAddr::new(esme_address, esme_ton)
            .map_err(AlertNotificationValidationError::EsmeAddr)?;

        Self::new(
            sequence_number,
            subscriber_ton,
            subscriber_npi,
            source_addr,
            esme_ton,
            esme_npi,
            esme_addr,
        )
    }

    /// Create an AlertNotification for international mobile subscriber
    pub fn international_subscriber_available(
        sequence_number: u32,
        subscriber_number: &str,
        esme_address: &str,
    ) -> Result<Self, AlertNotificationValidationError> {
        Self::subscriber_available(
            sequence_number,
            subscriber_number,
            TypeOfNumber::International,
            NumericPlanIndicator::Isdn,
            esme_address,
            TypeOfNumber::International,
            NumericPlanIndicator::Isdn,
        )
    }

    /// Get the subscriber address that is now available
    pub fn get_subscriber_address(&self) -> &SourceAddr {
        &self.source_addr
    }

    /// Get the ESME address to be notified
    pub fn get_esme_address(&self) -> &SourceAddr {
        &self.esme_addr
    }

    /// Check if this notification is for an international subscriber
    pub fn is_international_subscriber(&self) -> bool {
        self.source_addr_ton == TypeOfNumber::International
    }

    /// Check if this notification is for an international ESME
    pub fn is_international_esme(&self) -> bool {
        self.esme_addr_ton == TypeOfNumber::International
    }

    /// Get the subscriber number as a string (if available)
    pub fn get_subscriber_number(&self) -> Option<&str> {
        self.source_addr.as_str().ok()
    }

    /// Get the ESME address as a string (if available)
    pub fn get_esme_address_string(&self) -> Option<&str> {
        self.esme_addr.as_str().ok()
    }

    /// Validate the AlertNotification PDU
    fn validate(&self) -> Result<(), AlertNotificationValidationError> {
        // source_addr validation is handled by SourceAddr type
        // esme_addr validation is handled by SourceAddr type
        Ok(())
    }
}

impl Encodable for AlertNotification {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        // PDU Header (will be filled by codec)
        buf.put_u32(0); // command_length (placeholder)
        buf.put_u32(CommandId::AlertNotification as u32);
        buf.put_u32(u32::from(self.command_status));
        buf.put_u32(self.sequence_number);

        // Mandatory parameters
        // source_addr_ton (1 octet)
        encode_u8(buf, self.source_addr_ton as u8);

        // source_addr_npi (1 octet)
        encode_u8(buf, self.source_addr_npi as u8);

        // source_addr (null-terminated, no padding)
        encode_cstring(buf, self.source_addr.as_str().ok().unwrap_or(""), 21);

        // esme_addr_ton (1 octet)
        encode_u8(buf, self.esme_addr_ton as u8);

        // esme_addr_npi (1 octet)
        encode_u8(buf, self.esme_addr_npi as u8);

        // esme_addr, null-terminated, no padding
        encode_cstring(buf, self.esme_addr.as_str().ok().unwrap_or(""), 21);

        Ok(())
    }
}

impl Decodable for AlertNotification {
    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        // Decode mandatory parameters
        let source_addr_ton =
            TypeOfNumber::try_from(decode_u8(buf)?).map_err(|_| CodecError::FieldValidation {
                field: "source_addr_ton",
                reason: "Invalid TypeOfNumber value".to_string(),
            })?;

        let source_addr_npi = NumericPlanIndicator::try_from(decode_u8(buf)?).map_err(|_| {
            CodecError::FieldValidation {
                field: "source_addr_npi",
                reason: "Invalid NumericPlanIndicator value".to_string(),
            }
        })?;

        let source_addr_str = decode_cstring(buf, 21, "source_addr")?;
        let source_addr = SourceAddr::new(&source_addr_str, source_addr_ton).map_err(|e| {
            CodecError::FieldValidation {
                field: "source_addr",
                reason: format!("{e}"),
            }
        })?;

        let esme_addr_ton =
            TypeOfNumber::try_from(decode_u8(buf)?).map_err(|_| CodecError::FieldValidation {
                field: "esme_addr_ton",
                reason: "Invalid TypeOfNumber value".to_string(),
            })?;

        let esme_addr_npi = NumericPlanIndicator::try_from(decode_u8(buf)?).map_err(|_| {
            CodecError::FieldValidation {
                field: "esme_addr_npi",
                reason: "Invalid NumericPlanIndicator value".to_string(),
            }
        })?;

        let esme_addr_str = decode_cstring(buf, 21, "esme_addr")?;
        let esme_addr = SourceAddr::new(&esme_addr_str, esme_addr_ton).map_err(|e| {
            CodecError::FieldValidation {
                field: "esme_addr",
                reason: format!("{e}"),
            }
        })?;

        Ok(AlertNotification {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            source_addr_ton,
            source_addr_npi,
            source_addr,
            esme_addr_ton,
            esme_addr_npi,
            esme_addr,
        })
    }

    fn command_id() -> CommandId {
        CommandId::AlertNotification
    }
}
