//! SeaORM entity definitions
//!
//! Module names are English; the `table_name` attributes keep the original
//! Spanish table names, which are the wire contract.

pub mod user;
pub mod client;
pub mod technician;
pub mod property;
pub mod incident;
pub mod assignment;
pub mod budget;
pub mod payment;
pub mod inspection;
pub mod rating;

// Re-export all entities
pub use user::Entity as User;
pub use client::Entity as Client;
pub use technician::Entity as Technician;
pub use property::Entity as Property;
pub use incident::Entity as Incident;
pub use assignment::Entity as Assignment;
pub use budget::Entity as Budget;
pub use payment::Entity as Payment;
pub use inspection::Entity as Inspection;
pub use rating::Entity as Rating;

// Re-export active models for easy access
pub use user::ActiveModel as UserActive;
pub use client::ActiveModel as ClientActive;
pub use technician::ActiveModel as TechnicianActive;
pub use property::ActiveModel as PropertyActive;
pub use incident::ActiveModel as IncidentActive;
pub use assignment::ActiveModel as AssignmentActive;
pub use budget::ActiveModel as BudgetActive;
pub use payment::ActiveModel as PaymentActive;
pub use inspection::ActiveModel as InspectionActive;
pub use rating::ActiveModel as RatingActive;
