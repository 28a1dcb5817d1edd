//! Limited-memory quasi-Newton minimizers for functions of a dense vector.

mod history;
pub use self::history::{CurvaturePair, History};

mod line_search;
pub use self::line_search::{LineSearch, LineSearchBuilder, LineSearchBuilderError};

mod quasi_newton;
pub use self::quasi_newton::{IterationState, QuasiNewton, Strategy};

mod l_bfgs;
pub use self::l_bfgs::{LBFGSBuilder, LBFGSBuilderError};
pub use self::l_bfgs::LBFGS;

mod owl_qn;
pub use self::owl_qn::{OWLQNBuilder, OWLQNBuilderError};
pub use self::owl_qn::OWLQN;
