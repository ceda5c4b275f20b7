pub mod auth;
pub mod rest;
pub mod storage;
pub mod supabase;
