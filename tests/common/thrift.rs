//! Service side of `prepareOrder`, for the fake warehouse.

use std::io;

use payments_service::{
    models::order::{OrderItem, WarehouseUserInfo},
    warehouse::{
        ProtocolError, RemoteFault,
        protocol::{Decoder, Encoder, FieldType, MessageType, PREPARE_ORDER},
    },
};
use tokio::io::AsyncRead;

fn missing(field: &str) -> ProtocolError {
    io::Error::new(io::ErrorKind::InvalidData, format!("{field} missing")).into()
}

/// Encode the answer to the call numbered `seq_id`.
pub fn encode_reply(seq_id: i32, outcome: &Result<(), RemoteFault>) -> Vec<u8> {
    let mut enc = Encoder::new();
    match outcome {
        Ok(()) => {
            enc.write_message_begin(PREPARE_ORDER, MessageType::Reply, seq_id);
        }
        Err(RemoteFault::Application { kind, message }) => {
            enc.write_message_begin(PREPARE_ORDER, MessageType::Exception, seq_id);
            enc.write_field_begin(FieldType::String, 1);
            enc.write_string(message);
            enc.write_field_begin(FieldType::I32, 2);
            enc.write_i32(*kind);
        }
        Err(fault) => {
            enc.write_message_begin(PREPARE_ORDER, MessageType::Reply, seq_id);
            if let Some(id) = fault.field_id() {
                enc.write_field_begin(FieldType::Struct, id);
                enc.write_field_begin(FieldType::String, 1);
                enc.write_string(fault.message());
                enc.write_field_stop();
            }
        }
    }
    enc.write_field_stop();
    enc.into_bytes()
}

/// Read the argument struct following a `prepareOrder` call header.
pub async fn read_args<R>(
    dec: &mut Decoder<R>,
) -> Result<(WarehouseUserInfo, Vec<OrderItem>), ProtocolError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut user = None;
    let mut items = Vec::new();
    while let Some((ty, id)) = dec.read_field_begin().await? {
        match (ty, id) {
            (FieldType::Struct, 1) => user = Some(read_user_info(dec).await?),
            (FieldType::List, 2) => {
                let (elem, len) = dec.read_list_begin().await?;
                for _ in 0..len {
                    if elem == FieldType::Struct {
                        items.push(read_item_info(dec).await?);
                    } else {
                        dec.skip(elem).await?;
                    }
                }
            }
            (ty, _) => dec.skip(ty).await?,
        }
    }
    Ok((user.ok_or_else(|| missing("user"))?, items))
}

async fn read_user_info<R>(dec: &mut Decoder<R>) -> Result<WarehouseUserInfo, ProtocolError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut id = None;
    let mut user = WarehouseUserInfo {
        id: String::new(),
        name: None,
        middle_name: None,
        surname: None,
        address: None,
    };
    while let Some((ty, field)) = dec.read_field_begin().await? {
        match (ty, field) {
            (FieldType::String, 1) => id = Some(dec.read_string().await?),
            (FieldType::String, 2) => user.name = Some(dec.read_string().await?),
            (FieldType::String, 3) => user.middle_name = Some(dec.read_string().await?),
            (FieldType::String, 4) => user.surname = Some(dec.read_string().await?),
            (FieldType::String, 5) => user.address = Some(dec.read_string().await?),
            (ty, _) => dec.skip(ty).await?,
        }
    }
    user.id = id.ok_or_else(|| missing("UserInfo._id"))?;
    Ok(user)
}

async fn read_item_info<R>(dec: &mut Decoder<R>) -> Result<OrderItem, ProtocolError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut item_id = None;
    let mut quantity = None;
    while let Some((ty, field)) = dec.read_field_begin().await? {
        match (ty, field) {
            (FieldType::String, 1) => item_id = Some(dec.read_string().await?),
            (FieldType::I32, 2) => quantity = Some(dec.read_i32().await?),
            (ty, _) => dec.skip(ty).await?,
        }
    }
    Ok(OrderItem {
        item_id: item_id.ok_or_else(|| missing("ItemInfo._id"))?,
        quantity: quantity.ok_or_else(|| missing("ItemInfo.quantity"))?,
    })
}
