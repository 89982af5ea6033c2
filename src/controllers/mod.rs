pub mod apprentice_controller;
pub mod assignment_controller;
pub mod company_controller;
pub mod placement_controller;
