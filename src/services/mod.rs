pub mod mock_catalog;
pub mod spoonacular_service;
