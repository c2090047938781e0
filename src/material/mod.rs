mod material_data;
mod material_data_array;

pub use material_data::MaterialData;
pub use material_data_array::MaterialDataArray;

pub(crate) use material_data_array::same_index;
