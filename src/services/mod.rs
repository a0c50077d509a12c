pub mod itinerary_service;
pub mod openai_service;
pub mod response_normalizer;
