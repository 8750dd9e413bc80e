//! # Relay Server Library
//!
//! A real-time chat backend whose core is a message-routing hub:
//! - WebSocket gateway for real-time communication
//! - Single-task hub owning all connection and membership state
//! - PostgreSQL for persistent message storage
//! - JWT-authenticated connections
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and repository traits
//! - **Application Layer**: Business logic services
//! - **Hub**: The routing actor, its registry, and connection handles
//! - **Infrastructure Layer**: Database and repository implementations
//! - **Presentation Layer**: HTTP routes and the WebSocket adapter
//!
//! ## Module Structure
//!
//! ```text
//! relay_server/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities and repository traits
//! +-- application/   Application services
//! +-- hub/           Message routing actor and registry
//! +-- infrastructure/ Database implementations
//! +-- presentation/  HTTP routes and WebSocket handlers
//! +-- shared/        Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Message routing hub
pub mod hub;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
