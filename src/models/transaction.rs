//! Transaction models

use std::fmt::Display;

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Local, TimeZone, Utc};

use crate::contract::TransferStruct;
use crate::utils::units::wei_to_display;

/// One on-chain record, reshaped for display
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub address_from: Address,
    pub address_to: Address,
    pub timestamp: String,
    pub message: String,
    pub keyword: String,
    /// Display units (base units / 10^18)
    pub amount: f64,
    pub amount_wei: U256,
}

impl TransactionRecord {
    /// Reshape a raw record, rendering its timestamp in local time
    pub fn from_raw(raw: TransferStruct) -> Self {
        Self::from_raw_in(raw, &Local)
    }

    pub fn from_raw_in<Tz: TimeZone>(raw: TransferStruct, tz: &Tz) -> Self
    where
        Tz::Offset: Display,
    {
        Self {
            address_from: raw.sender,
            address_to: raw.receiver,
            timestamp: format_timestamp(raw.timestamp, tz),
            message: raw.message,
            keyword: raw.keyword,
            amount: wei_to_display(raw.amount),
            amount_wei: raw.amount,
        }
    }
}

/// Seconds since the epoch as a display string; out-of-range values are shown raw
pub fn format_timestamp<Tz: TimeZone>(seconds: U256, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let millis = u64::try_from(seconds)
        .ok()
        .and_then(|s| s.checked_mul(1000))
        .and_then(|ms| i64::try_from(ms).ok())
        .and_then(DateTime::<Utc>::from_timestamp_millis);

    match millis {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
        None => seconds.to_string(),
    }
}

/// Send form input, edited one field at a time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub recipient: String,
    pub amount: String,
    pub keyword: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Recipient,
    Amount,
    Keyword,
    Message,
}

impl FormData {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Recipient => self.recipient = value,
            FormField::Amount => self.amount = value,
            FormField::Keyword => self.keyword = value,
            FormField::Message => self.message = value,
        }
    }
}
