pub mod control;
pub mod cpu;
pub mod sysfs;
