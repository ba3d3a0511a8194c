pub mod configuration;

pub mod concurrent {
    pub mod synchronizedtabulatedfunction;
}

pub mod function {
    pub mod functionerror;
    pub mod point;
    pub mod mathfunction;
    pub mod simplefunction;

    pub mod tabulated {
        pub mod tabulatedfunction;
        pub mod interpolation;
        pub mod arraytabulatedfunction;
        pub mod linkedlisttabulatedfunction;
        pub mod tabulatedfunctionfactory;

        #[cfg(test)]
        mod proptests;
    }
}

pub mod io {
    pub mod functionsio;
}

pub mod operator {
    pub mod steppingdifferentialoperator;
    pub mod tabulateddifferentialoperator;
    pub mod tabulatedfunctionoperationservice;
}

pub mod registry {
    pub mod registryerror;
    pub mod namedfunction;
    pub mod functionregistry;
}
