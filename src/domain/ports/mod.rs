//! Port trait definitions (Hexagonal Architecture)
//!
//! Async interfaces the automation engine consumes from its collaborators:
//! - AutomationRuleRepository: durable rule store
//! - ProjectMembershipRepository: which project columns an issue sits on
//! - IssueService: issue and pull request mutations
//! - CrossReferenceResolver: references made by a pull request
//! - RuleLookup: name resolution for the rule authoring language

pub mod automation_rule_repository;
pub mod cross_reference_resolver;
pub mod issue_service;
pub mod project_membership_repository;
pub mod rule_lookup;

pub use automation_rule_repository::AutomationRuleRepository;
pub use cross_reference_resolver::CrossReferenceResolver;
pub use issue_service::IssueService;
pub use project_membership_repository::ProjectMembershipRepository;
pub use rule_lookup::RuleLookup;
