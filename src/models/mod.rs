// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Candidate, LegacyStory, PhysiqueQuery, MatchKind, LegacyMatch, ScoredCandidate, DistanceWeights, NewLead, Lead};
pub use requests::{FindLegacyRequest, SimilarPlayersRequest, LeadContact, LeadListQuery, AddCartItemRequest, UpdateCartItemRequest, RemoveCartItemRequest};
pub use responses::{LegacyMatchResponse, SimilarPlayersResponse, LeadListResponse, CartResponse, HealthResponse, ErrorResponse};
