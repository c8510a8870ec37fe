mod world;

pub use self::world::World;
