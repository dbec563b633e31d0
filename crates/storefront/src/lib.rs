//! Regenessa Storefront client engine.
//!
//! This crate implements the client-owned state machine behind the
//! Regenessa storefront: the server-synchronized cart, the two checkout
//! paths (manual bank-transfer and hosted-gateway redirect), and the
//! payment verification handshake that finalizes a gateway order exactly
//! once after the redirect back.
//!
//! The backend API is an external collaborator consumed over REST; see
//! [`backend`] for the endpoint contract. Durable client state (session
//! token, pending order intent) lives in [`storage`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod verify;
