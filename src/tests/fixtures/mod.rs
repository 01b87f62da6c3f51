pub(crate) mod starwars;
