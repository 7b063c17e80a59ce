mod helpers;

mod combat;
mod squads;
mod targeting;
