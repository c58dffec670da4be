//! Thrift binary protocol codec for the warehouse `prepareOrder` call.
//!
//! Strict binary encoding (big-endian, versioned message header) over a plain
//! buffered stream. There is no outer frame; every string and container carries
//! its own `i32` length prefix.
//!
//! ```text
//! message := i32 (VERSION_1 | type) | string name | i32 seq_id | struct
//! struct  := { u8 field_type | i16 field_id | value }* | u8 STOP
//! string  := i32 len | len bytes
//! list    := u8 elem_type | i32 len | value{len}
//! map     := u8 key_type | u8 value_type | i32 len | (key value){len}
//! ```
//!
//! Service definition spoken here:
//!
//! ```text
//! struct UserInfo { 1: string _id, 2: string name, 3: string middleName,
//!                   4: string surname, 5: string address }
//! struct ItemInfo { 1: string _id, 2: i32 quantity }
//! void prepareOrder(1: UserInfo user, 2: list<ItemInfo> items)
//!     throws (1: EntityNotFoundError e1, 2: ValidationError e2, 3: DatabaseError e3)
//! ```

use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::{ProtocolError, RemoteFault};
use crate::models::order::{OrderItem, WarehouseUserInfo};

pub const VERSION_1: u32 = 0x8001_0000;
const VERSION_MASK: u32 = 0xffff_0000;
const TYPE_MASK: u32 = 0x0000_00ff;

/// Largest string or container accepted from the peer.
const MAX_LEN: usize = 16 * 1024 * 1024;
const MAX_DEPTH: usize = 64;

pub const PREPARE_ORDER: &str = "prepareOrder";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    Call = 1,
    Reply = 2,
    Exception = 3,
    Oneway = 4,
}

impl MessageType {
    fn name(self) -> &'static str {
        match self {
            MessageType::Call => "call",
            MessageType::Reply => "reply",
            MessageType::Exception => "exception",
            MessageType::Oneway => "oneway",
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => MessageType::Call,
            2 => MessageType::Reply,
            3 => MessageType::Exception,
            4 => MessageType::Oneway,
            other => return Err(ProtocolError::UnknownMessageType(other)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FieldType {
    Stop = 0,
    Void = 1,
    Bool = 2,
    Byte = 3,
    Double = 4,
    I16 = 6,
    I32 = 8,
    I64 = 10,
    String = 11,
    Struct = 12,
    Map = 13,
    Set = 14,
    List = 15,
}

impl TryFrom<u8> for FieldType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => FieldType::Stop,
            1 => FieldType::Void,
            2 => FieldType::Bool,
            3 => FieldType::Byte,
            4 => FieldType::Double,
            6 => FieldType::I16,
            8 => FieldType::I32,
            10 => FieldType::I64,
            11 => FieldType::String,
            12 => FieldType::Struct,
            13 => FieldType::Map,
            14 => FieldType::Set,
            15 => FieldType::List,
            other => return Err(ProtocolError::UnknownFieldType(other)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    pub name: String,
    pub kind: MessageType,
    pub seq_id: i32,
}

/// Appends binary-protocol values to an in-memory frame.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_message_begin(&mut self, name: &str, kind: MessageType, seq_id: i32) {
        self.write_i32((VERSION_1 | kind as u32) as i32);
        self.write_string(name);
        self.write_i32(seq_id);
    }

    pub fn write_field_begin(&mut self, ty: FieldType, id: i16) {
        self.buf.push(ty as u8);
        self.buf.extend_from_slice(&id.to_be_bytes());
    }

    pub fn write_field_stop(&mut self) {
        self.buf.push(FieldType::Stop as u8);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_i32(value.len() as i32);
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn write_list_begin(&mut self, elem: FieldType, len: usize) {
        self.buf.push(elem as u8);
        self.write_i32(len as i32);
    }

    fn write_string_field(&mut self, id: i16, value: &str) {
        self.write_field_begin(FieldType::String, id);
        self.write_string(value);
    }

    /// Unset optional fields are left off the wire entirely.
    fn write_optional_string_field(&mut self, id: i16, value: Option<&str>) {
        if let Some(value) = value {
            self.write_string_field(id, value);
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads binary-protocol values from an async byte source.
pub struct Decoder<R> {
    reader: R,
}

impl<R> Decoder<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub async fn read_message_begin(&mut self) -> Result<MessageHeader, ProtocolError> {
        let word = self.reader.read_i32().await? as u32;
        if word & VERSION_MASK != VERSION_1 {
            return Err(ProtocolError::BadVersion(word));
        }
        let kind = MessageType::try_from((word & TYPE_MASK) as u8)?;
        let name = self.read_string().await?;
        let seq_id = self.reader.read_i32().await?;

        Ok(MessageHeader { name, kind, seq_id })
    }

    /// Next field header, or `None` at the end of the struct.
    pub async fn read_field_begin(&mut self) -> Result<Option<(FieldType, i16)>, ProtocolError> {
        let ty = FieldType::try_from(self.reader.read_u8().await?)?;
        if ty == FieldType::Stop {
            return Ok(None);
        }
        let id = self.reader.read_i16().await?;
        Ok(Some((ty, id)))
    }

    pub async fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        Ok(self.reader.read_i32().await?)
    }

    pub async fn read_string(&mut self) -> Result<String, ProtocolError> {
        let bytes = self.read_binary().await?;
        String::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8)
    }

    async fn read_binary(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let len = self.read_len().await?;
        let mut bytes = vec![0; len];
        self.reader.read_exact(&mut bytes).await?;
        Ok(bytes)
    }

    pub async fn read_list_begin(&mut self) -> Result<(FieldType, usize), ProtocolError> {
        let elem = FieldType::try_from(self.reader.read_u8().await?)?;
        let len = self.read_len().await?;
        Ok((elem, len))
    }

    async fn read_len(&mut self) -> Result<usize, ProtocolError> {
        let len = self.reader.read_i32().await?;
        let len = usize::try_from(len).map_err(|_| ProtocolError::NegativeSize(len))?;
        if len > MAX_LEN {
            return Err(ProtocolError::SizeLimit(len));
        }
        Ok(len)
    }

    /// Consume one value of type `ty` without interpreting it.
    pub async fn skip(&mut self, ty: FieldType) -> Result<(), ProtocolError> {
        self.skip_nested(ty, 0).await
    }

    fn skip_nested(&mut self, ty: FieldType, depth: usize) -> BoxFuture<'_, Result<(), ProtocolError>> {
        Box::pin(async move {
            if depth > MAX_DEPTH {
                return Err(ProtocolError::DepthLimit);
            }
            match ty {
                FieldType::Stop | FieldType::Void => {}
                FieldType::Bool | FieldType::Byte => {
                    self.reader.read_u8().await?;
                }
                FieldType::I16 => {
                    self.reader.read_i16().await?;
                }
                FieldType::I32 => {
                    self.reader.read_i32().await?;
                }
                FieldType::I64 | FieldType::Double => {
                    self.reader.read_i64().await?;
                }
                FieldType::String => {
                    self.read_binary().await?;
                }
                FieldType::Struct => {
                    while let Some((field_ty, _)) = self.read_field_begin().await? {
                        self.skip_nested(field_ty, depth + 1).await?;
                    }
                }
                FieldType::Map => {
                    let key = FieldType::try_from(self.reader.read_u8().await?)?;
                    let value = FieldType::try_from(self.reader.read_u8().await?)?;
                    let len = self.read_len().await?;
                    for _ in 0..len {
                        self.skip_nested(key, depth + 1).await?;
                        self.skip_nested(value, depth + 1).await?;
                    }
                }
                FieldType::Set | FieldType::List => {
                    let (elem, len) = self.read_list_begin().await?;
                    for _ in 0..len {
                        self.skip_nested(elem, depth + 1).await?;
                    }
                }
            }
            Ok(())
        })
    }
}

/// Encode a complete `prepareOrder` call message.
pub fn encode_prepare_order_call(
    seq_id: i32,
    user: &WarehouseUserInfo,
    items: &[OrderItem],
) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.write_message_begin(PREPARE_ORDER, MessageType::Call, seq_id);

    enc.write_field_begin(FieldType::Struct, 1);
    write_user_info(&mut enc, user);

    enc.write_field_begin(FieldType::List, 2);
    enc.write_list_begin(FieldType::Struct, items.len());
    for item in items {
        write_item_info(&mut enc, item);
    }

    enc.write_field_stop();
    enc.into_bytes()
}

fn write_user_info(enc: &mut Encoder, user: &WarehouseUserInfo) {
    enc.write_string_field(1, &user.id);
    enc.write_optional_string_field(2, user.name.as_deref());
    enc.write_optional_string_field(3, user.middle_name.as_deref());
    enc.write_optional_string_field(4, user.surname.as_deref());
    enc.write_optional_string_field(5, user.address.as_deref());
    enc.write_field_stop();
}

fn write_item_info(enc: &mut Encoder, item: &OrderItem) {
    enc.write_string_field(1, &item.item_id);
    enc.write_field_begin(FieldType::I32, 2);
    enc.write_i32(item.quantity);
    enc.write_field_stop();
}

/// Read the reply to the call sent with `expected_seq_id`.
///
/// The outer `Result` is the wire; the inner one is what the service answered.
pub async fn read_prepare_order_reply<R>(
    dec: &mut Decoder<R>,
    expected_seq_id: i32,
) -> Result<Result<(), RemoteFault>, ProtocolError>
where
    R: AsyncRead + Unpin + Send,
{
    let header = dec.read_message_begin().await?;
    if header.name != PREPARE_ORDER || header.seq_id != expected_seq_id {
        return Err(ProtocolError::UnexpectedReply {
            name: header.name,
            seq_id: header.seq_id,
        });
    }

    match header.kind {
        MessageType::Reply => read_result_struct(dec).await,
        MessageType::Exception => Ok(Err(read_application_exception(dec).await?)),
        other => Err(ProtocolError::UnexpectedMessageType(other.name())),
    }
}

async fn read_result_struct<R>(dec: &mut Decoder<R>) -> Result<Result<(), RemoteFault>, ProtocolError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut fault = None;
    while let Some((ty, id)) = dec.read_field_begin().await? {
        match (ty, id) {
            (FieldType::Struct, 1) => {
                fault = Some(RemoteFault::EntityNotFound(read_exception_message(dec).await?));
            }
            (FieldType::Struct, 2) => {
                fault = Some(RemoteFault::Validation(read_exception_message(dec).await?));
            }
            (FieldType::Struct, 3) => {
                fault = Some(RemoteFault::Database(read_exception_message(dec).await?));
            }
            (ty, _) => dec.skip(ty).await?,
        }
    }
    Ok(fault.map_or(Ok(()), Err))
}

async fn read_exception_message<R>(dec: &mut Decoder<R>) -> Result<String, ProtocolError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut message = String::new();
    while let Some((ty, id)) = dec.read_field_begin().await? {
        match (ty, id) {
            (FieldType::String, 1) => message = dec.read_string().await?,
            (ty, _) => dec.skip(ty).await?,
        }
    }
    Ok(message)
}

async fn read_application_exception<R>(dec: &mut Decoder<R>) -> Result<RemoteFault, ProtocolError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut message = String::new();
    let mut kind = 0;
    while let Some((ty, id)) = dec.read_field_begin().await? {
        match (ty, id) {
            (FieldType::String, 1) => message = dec.read_string().await?,
            (FieldType::I32, 2) => kind = dec.read_i32().await?,
            (ty, _) => dec.skip(ty).await?,
        }
    }
    Ok(RemoteFault::Application { kind, message })
}

#[cfg(test)]
/// A `prepareOrder` reply as the warehouse would send it.
pub(crate) fn reply_frame(seq_id: i32, outcome: &Result<(), RemoteFault>) -> Vec<u8> {
    let mut enc = Encoder::new();
    match outcome {
        Err(RemoteFault::Application { kind, message }) => {
            enc.write_message_begin(PREPARE_ORDER, MessageType::Exception, seq_id);
            enc.write_string_field(1, message);
            enc.write_field_begin(FieldType::I32, 2);
            enc.write_i32(*kind);
        }
        Err(fault) => {
            enc.write_message_begin(PREPARE_ORDER, MessageType::Reply, seq_id);
            enc.write_field_begin(FieldType::Struct, fault.field_id().unwrap());
            enc.write_string_field(1, fault.message());
            enc.write_field_stop();
        }
        Ok(()) => enc.write_message_begin(PREPARE_ORDER, MessageType::Reply, seq_id),
    }
    enc.write_field_stop();
    enc.into_bytes()
}
