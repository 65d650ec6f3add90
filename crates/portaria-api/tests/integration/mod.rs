mod authorizations;
mod services;
mod session;
mod users;
