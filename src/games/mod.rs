pub mod oldmaid;
