mod device;
mod lazy_plate;

pub use device::get_sample_msg_device;
pub use lazy_plate::LazyPlate;
