// Domain-layer modules and shared errors/models
pub mod normalizer {
    pub use crate::normalizer::*;
}

pub mod orchestrator {
    pub use crate::orchestrator::*;
}

pub mod envelope {
    pub use crate::envelope::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
