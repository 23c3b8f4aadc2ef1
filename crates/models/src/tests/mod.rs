/// CRUD and constraint tests for the directory entities
pub mod crud_tests;
