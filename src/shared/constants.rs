/// Model-level error reported when a villa with the same name exists
pub const VILLA_ALREADY_EXISTS: &str = "Villa Already Exists!";

/// Base path of the villa resource
pub const VILLAS_PATH: &str = "/api/villas";
