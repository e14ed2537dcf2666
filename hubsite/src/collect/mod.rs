pub mod cadastre;
pub mod enedis;
pub mod http;
pub mod nominatim;
pub mod overpass;
pub mod owners;
pub mod storage;
