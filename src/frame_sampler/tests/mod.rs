mod sampler_test;
