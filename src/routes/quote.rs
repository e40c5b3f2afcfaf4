use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use log::info;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::FindOptions,
    Client,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    config::{default_costs, AppConfig},
    db::mongo,
    error::ApiError,
    models::{
        envelope::ApiResponse,
        quote::form::QuoteForm,
        quote_record::{QuoteRecord, QuoteStatus, SaveQuoteRequest, StatusUpdate},
    },
    services::{
        distance_service::SegmentDistanceSource,
        quote_service::{QuoteEstimate, QuoteService},
    },
};

const DEFAULT_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    pub limit: Option<u16>,
    pub search: Option<String>,
    pub status: Option<QuoteStatus>,
}

fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::InvalidId)
}

/// Matches client name, origin, destination or any itinerary stop.
pub fn list_filter(params: &QueryParams) -> Document {
    let mut filter = doc! {};
    if let Some(status) = params.status {
        filter.insert("status", status.as_str());
    }
    if let Some(search) = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = regex::escape(search);
        let fields = [
            "client_name",
            "origin",
            "destination",
            "snapshot.itinerary.destinations",
        ];
        let clauses: Vec<Document> = fields
            .iter()
            .map(|field| {
                let mut clause = Document::new();
                clause.insert(*field, doc! { "$regex": pattern.as_str(), "$options": "i" });
                clause
            })
            .collect();
        filter.insert("$or", clauses);
    }
    filter
}

fn compute_estimate(config: &AppConfig, form: &QuoteForm) -> Result<QuoteEstimate, ApiError> {
    let source = SegmentDistanceSource::new(config.km_per_segment);
    Ok(QuoteService::estimate(form, &source, Some(Utc::now()))?)
}

/*
    /api/quotes/defaults
*/
pub async fn defaults() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(QuoteForm::with_defaults(default_costs())))
}

/*
    /api/quotes/estimate
*/
pub async fn estimate_quote(
    config: web::Data<AppConfig>,
    input: web::Json<QuoteForm>,
) -> Result<HttpResponse, ApiError> {
    let estimate = compute_estimate(&config, &input)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(estimate)))
}

/*
    /api/quotes
*/
pub async fn get_all(
    data: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
    params: web::Query<QueryParams>,
) -> Result<HttpResponse, ApiError> {
    let collection = mongo::quotes(&data, &config);

    let mut options = FindOptions::default();
    options.sort = Some(doc! { "created_at": -1 });
    options.limit = Some(params.limit.map(i64::from).unwrap_or(DEFAULT_LIMIT));

    let quotes: Vec<QuoteRecord> = collection
        .find(list_filter(&params))
        .with_options(options)
        .await?
        .try_collect()
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(quotes)))
}

/*
    /api/quotes/{id}
*/
pub async fn get_by_id(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let collection = mongo::quotes(&data, &config);

    match collection.find_one(doc! { "_id": id }).await? {
        Some(quote) => Ok(HttpResponse::Ok().json(ApiResponse::success(quote))),
        None => Err(ApiError::NotFound),
    }
}

pub async fn create(
    data: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
    input: web::Json<SaveQuoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = input.into_inner();
    let estimate = compute_estimate(&config, &request.form)?;
    let mut record = QuoteService::new_record(&request, estimate, Utc::now());

    let collection = mongo::quotes(&data, &config);
    let inserted = collection.insert_one(&record).await?;
    record.id = inserted.inserted_id.as_object_id();

    info!("Saved quote {}", record.quote_number);
    Ok(HttpResponse::Created().json(ApiResponse::success(record)))
}

pub async fn update(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
    input: web::Json<SaveQuoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let request = input.into_inner();
    let estimate = compute_estimate(&config, &request.form)?;

    let collection = mongo::quotes(&data, &config);
    let existing = collection
        .find_one(doc! { "_id": id })
        .await?
        .ok_or(ApiError::NotFound)?;

    let record = QuoteService::updated_record(&existing, &request, estimate, Utc::now());
    let result = collection.replace_one(doc! { "_id": id }, &record).await?;
    if result.matched_count == 0 {
        return Err(ApiError::NotFound);
    }

    info!("Updated quote {}", record.quote_number);
    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

/*
    /api/quotes/{id}/status
*/
pub async fn update_status(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
    input: web::Json<StatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let collection = mongo::quotes(&data, &config);

    let update = doc! {
        "$set": {
            "status": input.status.as_str(),
            "updated_at": DateTime::now(),
        }
    };
    let result = collection.update_one(doc! { "_id": id }, update).await?;
    if result.matched_count == 0 {
        return Err(ApiError::NotFound);
    }

    let quote = collection
        .find_one(doc! { "_id": id })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(quote)))
}

pub async fn delete(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let collection = mongo::quotes(&data, &config);

    let result = collection.delete_one(doc! { "_id": id }).await?;
    if result.deleted_count == 0 {
        return Err(ApiError::NotFound);
    }

    info!("Deleted quote {}", id);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Quote deleted successfully")))
}
