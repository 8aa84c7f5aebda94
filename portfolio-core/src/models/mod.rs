mod award;
mod event;
mod experience;
mod interest;
mod item;
mod lab;
mod portfolio;
mod profile;
mod publication;

pub use award::{Award, FinancialSupport};
pub use event::{Activity, Conference, Talk};
pub use experience::Experience;
pub use interest::{ResearchInterest, TeachingInterest};
pub use item::Item;
pub use lab::{default_equipment, Lab, LabHours, LabLocation};
pub use portfolio::Portfolio;
pub use profile::Profile;
pub use publication::{BookChapter, Publication};
