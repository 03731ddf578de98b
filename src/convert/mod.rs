pub mod backend;
pub mod browser;
pub mod external;
pub mod inkscape;
pub mod native;
pub mod options;
pub mod probe;
pub mod registry;
pub mod rsvg;
