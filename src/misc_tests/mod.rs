#[cfg(test)]
mod round_trip;

#[cfg(test)]
mod malformed;

#[cfg(test)]
mod properties;
