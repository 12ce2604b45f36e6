mod document;
mod fetch;
mod load;
mod pipeline;
mod prompt;
mod run;
mod select;
#[cfg(test)]
mod test_support;

pub use run::run;
