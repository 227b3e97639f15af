//! HTTP surface over the trade builder.
//!
//! Amounts travel as decimal wei strings. The server holds no keys: trade
//! endpoints answer with an unsigned transaction request.

use std::sync::Arc;

use alloy_primitives::U256;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use curve_sdk::{
    parse_token_address, BuyArgs, ErrorCode, EvmViewTransport, SellArgs, TradeBuilder,
    TradeRequest,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

type Engine<T> = Arc<TradeBuilder<T>>;

pub fn router<T>(builder: Engine<T>) -> Router
where
    T: EvmViewTransport + 'static,
{
    Router::new()
        .route("/price/:token", get(price::<T>))
        .route("/trade/buy", post(trade_buy::<T>))
        .route("/trade/sell", post(trade_sell::<T>))
        .with_state(builder)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyBody {
    pub token_address: String,
    pub eth_amount: String,
    pub min_tokens_out: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellBody {
    pub token_address: String,
    pub token_amount: String,
    pub min_eth_out: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequestBody {
    pub to: String,
    pub data: String,
    pub value: String,
    pub gas: u64,
    pub min_out: String,
    pub quoted_out: String,
}

impl From<&TradeRequest> for TransactionRequestBody {
    fn from(value: &TradeRequest) -> Self {
        Self {
            to: value.to.to_string(),
            data: value.data.to_string(),
            value: value.value.to_string(),
            gas: value.gas,
            min_out: value.min_out.to_string(),
            quoted_out: value.quoted_out.to_string(),
        }
    }
}

struct ApiError(ErrorCode);

impl From<ErrorCode> for ApiError {
    fn from(value: ErrorCode) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0;
        let status = match code {
            ErrorCode::TokenNotFound => StatusCode::NOT_FOUND,
            _ if code.is_rejection() => StatusCode::CONFLICT,
            ErrorCode::InvalidInput
            | ErrorCode::InvalidAddress
            | ErrorCode::EmptyReserves => StatusCode::BAD_REQUEST,
            _ if code.is_retryable() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if code.is_rejection() {
            info!("trade declined: {code}");
        } else if code.is_retryable() {
            warn!("upstream rpc failure: {code}");
        } else if status.is_server_error() {
            error!("request failed: {code}");
        }
        let body = json!({
            "success": false,
            "error": code.reason(),
            "code": code.code(),
            "retryable": code.is_retryable(),
            "rejected": code.is_rejection(),
        });
        (status, Json(body)).into_response()
    }
}

fn amount(value: &str) -> Result<U256, ApiError> {
    U256::from_str_radix(value.trim(), 10).map_err(|_| ApiError(ErrorCode::InvalidInput))
}

fn optional_amount(value: Option<&str>) -> Result<Option<U256>, ApiError> {
    value.map(amount).transpose()
}

async fn price<T: EvmViewTransport + 'static>(
    State(builder): State<Engine<T>>,
    Path(token): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = parse_token_address(&token)?;
    let (_, metrics) = builder.price(token).await?;
    Ok(Json(json!({
        "price": metrics.price,
        "marketCap": metrics.market_cap,
        "volume24h": metrics.volume_proxy,
        "bondingProgress": metrics.bonding_progress,
        "defaultSellSlippageBps": builder.default_sell_slippage_bps(),
    })))
}

async fn trade_buy<T: EvmViewTransport + 'static>(
    State(builder): State<Engine<T>>,
    Json(body): Json<BuyBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let args = BuyArgs {
        token: parse_token_address(&body.token_address)?,
        eth_in: amount(&body.eth_amount)?,
        min_tokens_out: optional_amount(body.min_tokens_out.as_deref())?,
    };
    let request = builder.build_buy(args).await?;
    Ok(Json(json!({
        "success": true,
        "transactionRequest": TransactionRequestBody::from(&request),
    })))
}

async fn trade_sell<T: EvmViewTransport + 'static>(
    State(builder): State<Engine<T>>,
    Json(body): Json<SellBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let args = SellArgs {
        token: parse_token_address(&body.token_address)?,
        token_in: amount(&body.token_amount)?,
        min_eth_out: optional_amount(body.min_eth_out.as_deref())?,
    };
    let request = builder.build_sell(args).await?;
    Ok(Json(json!({
        "success": true,
        "ethReceived": request.quoted_out.to_string(),
        "txHash": null,
        "transactionRequest": TransactionRequestBody::from(&request),
    })))
}
