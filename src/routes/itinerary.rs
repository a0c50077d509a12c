use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{web, HttpResponse, HttpResponseBuilder, Responder};
use mongodb::{bson::oid::ObjectId, Client};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::models::itinerary::{DeleteItineraryRequest, GenerateItineraryRequest};
use crate::services::itinerary_service;
use crate::services::openai_service::{self, OpenAiService};
use crate::services::response_normalizer::normalize_itinerary;

// Generations must never be served from an intermediary cache.
fn no_store(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    builder.insert_header(CacheControl(vec![CacheDirective::NoStore]));
    builder
}

/*
    POST /api/itineraries
*/
pub async fn generate(
    data: web::Data<Arc<Client>>,
    input: web::Json<GenerateItineraryRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let request = input.into_inner();

    if request.destinations.is_empty() {
        return no_store(HttpResponse::BadRequest()).json(json!({
            "error": "Missing destinations"
        }));
    }

    let prompt = openai_service::build_prompt(
        &request.destinations,
        request.days,
        &request.traveler_type,
        &request.preferences,
    );

    let openai = match OpenAiService::new() {
        Ok(service) => service,
        Err(err) => {
            eprintln!("OpenAI service unavailable: {}", err);
            return no_store(HttpResponse::InternalServerError()).json(json!({
                "error": "Failed to generate itinerary"
            }));
        }
    };

    let raw_response = match openai.generate_itinerary(&prompt).await {
        Ok(text) => text,
        Err(err) => {
            eprintln!("OpenAI API error: {}", err);
            return no_store(HttpResponse::InternalServerError()).json(json!({
                "error": "Failed to generate itinerary"
            }));
        }
    };

    println!("Raw OpenAI response: {}", raw_response);

    let itinerary = match normalize_itinerary(&raw_response) {
        Ok(days) => days,
        Err(err) => {
            eprintln!("Failed to parse itinerary JSON: {}", err);
            return no_store(HttpResponse::InternalServerError()).json(json!({
                "error": "Failed to generate valid itinerary",
                "rawResponse": err.raw_response,
            }));
        }
    };

    // A failed save is not allowed to discard the generation the user paid
    // for; it degrades to a success response with a saveError marker.
    match itinerary_service::insert_itinerary(
        &client,
        request.destinations,
        request.days,
        request.preferences,
        request.traveler_type,
        itinerary.clone(),
    )
    .await
    {
        Ok(id) => no_store(HttpResponse::Ok()).json(json!({
            "itinerary": itinerary,
            "id": id.to_hex(),
        })),
        Err(err) => {
            eprintln!("Failed to insert document: {:?}", err);
            no_store(HttpResponse::Ok()).json(json!({
                "itinerary": itinerary,
                "saveError": "Itinerary generated but could not be saved",
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
}

/*
    GET /api/itineraries?page=N
*/
pub async fn get_all(
    data: web::Data<Arc<Client>>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let client = data.into_inner();
    let page = query.page.unwrap_or(1).max(1);

    match itinerary_service::list_itineraries(&client, page).await {
        Ok((itineraries, total_pages)) => HttpResponse::Ok().json(json!({
            "itineraries": itineraries,
            "totalPages": total_pages,
            "currentPage": page,
        })),
        Err(err) => {
            eprintln!("Error fetching itineraries: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to fetch itineraries"
            }))
        }
    }
}

/*
    GET /api/itineraries/{id}
*/
pub async fn get_by_id(path: web::Path<String>, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({ "error": "Invalid ID" }));
        }
    };

    match itinerary_service::find_by_id(&client, id).await {
        Ok(Some(itinerary)) => HttpResponse::Ok().json(json!({ "itinerary": itinerary })),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Itinerary not found" })),
        Err(err) => {
            eprintln!("Error fetching itinerary: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to fetch itinerary"
            }))
        }
    }
}

/*
    DELETE /api/itineraries (body carries the id)
*/
pub async fn delete(
    data: web::Data<Arc<Client>>,
    input: web::Json<DeleteItineraryRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let id: ObjectId = match ObjectId::parse_str(&input.id) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({ "error": "Invalid ID" }));
        }
    };

    match itinerary_service::delete_by_id(&client, id).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(err) => {
            eprintln!("Error deleting itinerary: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to delete itinerary"
            }))
        }
    }
}
