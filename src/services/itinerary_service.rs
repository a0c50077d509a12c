use bson::{doc, DateTime};
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::{Client, Collection};
use serde_json::Value;
use std::sync::Arc;

use crate::models::itinerary::{Preferences, SavedItinerary};

pub const PAGE_SIZE: u64 = 5;

fn saved_itineraries(client: &Client) -> Collection<SavedItinerary> {
    client.database("Itineraries").collection("Saved")
}

/// Number of pages needed to show `count` rows at `page_size` rows per page.
pub fn total_pages(count: u64, page_size: u64) -> u64 {
    (count + page_size - 1) / page_size
}

/// Inserts one itinerary row and returns its id. The id is generated here so
/// the caller gets it back without re-reading the inserted document.
pub async fn insert_itinerary(
    client: &Arc<Client>,
    destinations: Vec<String>,
    num_days: u32,
    preferences: Preferences,
    traveler_type: String,
    days: Vec<Value>,
) -> Result<ObjectId, mongodb::error::Error> {
    let id = ObjectId::new();
    let submission = SavedItinerary {
        id: Some(id),
        destinations,
        num_days,
        preferences,
        traveler_type,
        days,
        created_at: Some(DateTime::now()),
    };

    saved_itineraries(client).insert_one(&submission).await?;
    Ok(id)
}

/// Returns one page of saved itineraries, newest first, plus the total page
/// count. Pages are 1-indexed; a page past the end yields an empty vec.
pub async fn list_itineraries(
    client: &Arc<Client>,
    page: u64,
) -> Result<(Vec<SavedItinerary>, u64), mongodb::error::Error> {
    let collection = saved_itineraries(client);

    let count = collection.count_documents(doc! {}).await?;
    let pages = total_pages(count, PAGE_SIZE);

    let skip = (page.max(1) - 1) * PAGE_SIZE;
    let cursor = collection
        .find(doc! {})
        .sort(doc! { "created_at": -1 })
        .skip(skip)
        .limit(PAGE_SIZE as i64)
        .await?;

    let itineraries: Vec<SavedItinerary> = cursor.try_collect().await?;
    Ok((itineraries, pages))
}

pub async fn find_by_id(
    client: &Arc<Client>,
    id: ObjectId,
) -> Result<Option<SavedItinerary>, mongodb::error::Error> {
    saved_itineraries(client).find_one(doc! { "_id": id }).await
}

/// Deletes by id without checking existence first: removing an id that is
/// already gone is indistinguishable from removing one that was present.
pub async fn delete_by_id(
    client: &Arc<Client>,
    id: ObjectId,
) -> Result<(), mongodb::error::Error> {
    saved_itineraries(client)
        .delete_one(doc! { "_id": id })
        .await?;
    Ok(())
}
