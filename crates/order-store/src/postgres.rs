use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    ConsignmentId, NewOrder, Order, OrderPage, OrderQuery, OrderStatus, Result, StoreError,
    store::{OrderRepository, validate_new_order},
};

const ORDER_COLUMNS: &str = r#"
    id, store_id, merchant_order_id, recipient_name, recipient_phone, recipient_address,
    recipient_city, recipient_zone, recipient_area, delivery_type, item_type,
    special_instruction, item_quantity, item_weight, amount_to_collect, item_description,
    order_status, order_consignment_id, order_created_at, order_type_id, order_type,
    total_fee, cod_fee, promo_discount, discount, delivery_fee, created_at, updated_at
"#;

const UNIQUE_CONSIGNMENT_CONSTRAINT: &str = "unique_order_consignment_id";

/// PostgreSQL-backed order repository.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgreSQL order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let status: String = row.try_get("order_status")?;

        Ok(Order {
            id: row.try_get("id")?,
            store_id: row.try_get("store_id")?,
            merchant_order_id: row.try_get("merchant_order_id")?,
            recipient_name: row.try_get("recipient_name")?,
            recipient_phone: row.try_get("recipient_phone")?,
            recipient_address: row.try_get("recipient_address")?,
            recipient_city: row.try_get("recipient_city")?,
            recipient_zone: row.try_get("recipient_zone")?,
            recipient_area: row.try_get("recipient_area")?,
            delivery_type: row.try_get("delivery_type")?,
            item_type: row.try_get("item_type")?,
            special_instruction: row.try_get("special_instruction")?,
            item_quantity: row.try_get("item_quantity")?,
            item_weight: row.try_get("item_weight")?,
            amount_to_collect: row.try_get("amount_to_collect")?,
            item_description: row.try_get("item_description")?,
            order_status: status.parse::<OrderStatus>()?,
            consignment_id: ConsignmentId::new(row.try_get::<String, _>("order_consignment_id")?),
            order_created_at: row.try_get("order_created_at")?,
            order_type_id: row.try_get("order_type_id")?,
            order_type: row.try_get("order_type")?,
            total_fee: row.try_get("total_fee")?,
            cod_fee: row.try_get("cod_fee")?,
            promo_discount: row.try_get("promo_discount")?,
            discount: row.try_get("discount")?,
            delivery_fee: row.try_get("delivery_fee")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        validate_new_order(&order)?;

        let sql = format!(
            r#"
            INSERT INTO orders (
                store_id, merchant_order_id, recipient_name, recipient_phone, recipient_address,
                recipient_city, recipient_zone, recipient_area, delivery_type, item_type,
                special_instruction, item_quantity, item_weight, amount_to_collect, item_description,
                order_status, order_consignment_id, order_created_at, order_type_id, order_type,
                total_fee, cod_fee, promo_discount, discount, delivery_fee
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(order.store_id)
            .bind(&order.merchant_order_id)
            .bind(&order.recipient_name)
            .bind(&order.recipient_phone)
            .bind(&order.recipient_address)
            .bind(order.recipient_city)
            .bind(order.recipient_zone)
            .bind(order.recipient_area)
            .bind(order.delivery_type)
            .bind(order.item_type)
            .bind(&order.special_instruction)
            .bind(order.item_quantity)
            .bind(order.item_weight)
            .bind(order.amount_to_collect)
            .bind(&order.item_description)
            .bind(order.order_status.as_str())
            .bind(order.consignment_id.as_str())
            .bind(order.order_created_at)
            .bind(order.order_type_id)
            .bind(&order.order_type)
            .bind(order.total_fee)
            .bind(order.cod_fee)
            .bind(order.promo_discount)
            .bind(order.discount)
            .bind(order.delivery_fee)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.constraint() == Some(UNIQUE_CONSIGNMENT_CONSTRAINT)
                {
                    return StoreError::DuplicateConsignmentId(order.consignment_id.clone());
                }
                StoreError::Database(e)
            })?;

        Self::row_to_order(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn find_by_consignment_id(
        &self,
        consignment_id: &ConsignmentId,
    ) -> Result<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_consignment_id = $1");
        let row = sqlx::query(&sql)
            .bind(consignment_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn list(&self, query: OrderQuery) -> Result<OrderPage> {
        // Count and page from the same snapshot
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM orders
            WHERE ($1::TEXT IS NULL OR LOWER(order_status) = LOWER($1))
            "#,
        )
        .bind(query.status.as_deref())
        .fetch_one(&mut *tx)
        .await?;
        let total = u64::try_from(total).unwrap_or(0);

        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        // An offset past i64::MAX is past every row
        let Ok(offset) = i64::try_from(query.offset) else {
            tx.commit().await?;
            return Ok(OrderPage {
                orders: Vec::new(),
                total,
            });
        };

        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE ($1::TEXT IS NULL OR LOWER(order_status) = LOWER($1))
            ORDER BY order_created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(query.status.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let orders = rows
            .into_iter()
            .map(Self::row_to_order)
            .collect::<Result<Vec<_>>>()?;

        Ok(OrderPage { orders, total })
    }

    async fn update_status(
        &self,
        consignment_id: &ConsignmentId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Option<Order>> {
        // Single conditional UPDATE: row-level atomicity decides concurrent races
        let sql = format!(
            r#"
            UPDATE orders
            SET order_status = $3, updated_at = NOW()
            WHERE order_consignment_id = $1 AND order_status = $2
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(consignment_id.as_str())
            .bind(expected.as_str())
            .bind(next.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }
}
