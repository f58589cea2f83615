//! Database queries for rooms

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::Room;

/// Get a room by id
pub async fn get_room(pool: &PgPool, room_id: Uuid) -> Result<Option<Room>, StoreError> {
    let room = sqlx::query_as::<_, Room>(
        r#"
        SELECT id, name, price, base_price, beds24_room_id, capacity
        FROM rooms
        WHERE id = $1
        "#,
    )
    .bind(room_id)
    .fetch_optional(pool)
    .await?;

    Ok(room)
}

/// Get all rooms ordered by name
pub async fn list_rooms(pool: &PgPool) -> Result<Vec<Room>, StoreError> {
    let rooms = sqlx::query_as::<_, Room>(
        r#"
        SELECT id, name, price, base_price, beds24_room_id, capacity
        FROM rooms
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rooms)
}

/// Set a room's base nightly price. Returns `None` if the room does not exist.
pub async fn update_base_price(
    pool: &PgPool,
    room_id: Uuid,
    base_price: Decimal,
) -> Result<Option<Room>, StoreError> {
    let room = sqlx::query_as::<_, Room>(
        r#"
        UPDATE rooms
        SET base_price = $2, updated_at = now()
        WHERE id = $1
        RETURNING id, name, price, base_price, beds24_room_id, capacity
        "#,
    )
    .bind(room_id)
    .bind(base_price)
    .fetch_optional(pool)
    .await?;

    Ok(room)
}
