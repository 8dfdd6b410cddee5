mod mocks;
mod orders;
mod payments;
