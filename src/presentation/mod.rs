pub mod payload;

pub use payload::{
    present, present_outcome, PresentOptions, ProblemView, RoutePayload, SolutionPayload,
    SolveResponse,
};
